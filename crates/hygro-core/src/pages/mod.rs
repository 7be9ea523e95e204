//! UI pages: the info/splash screen and the main measurement screen.

pub mod info;
pub mod main;
pub mod page;
pub mod page_manager;

pub use info::InfoPage;
pub use main::MainPage;
pub use page::{Page, PageId};
pub use page_manager::PageManager;
