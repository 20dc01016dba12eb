mod chrome_bar;
mod footer;
mod header;
mod help;
mod layout;
mod list_view;
mod theme;

pub use chrome_bar::ChromeBar;
pub use footer::Footer;
pub use header::Header;
pub use help::HelpView;
pub use layout::AppLayout;
pub use list_view::ListView;
pub use theme::Theme;
