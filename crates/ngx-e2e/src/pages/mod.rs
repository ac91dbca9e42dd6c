// Page objects
//
// Each page object borrows a page handle for its lifetime and exposes
// named operations built from selectors. None of them assert; tests do.

pub mod ajax;
pub mod datepicker;
pub mod form_layouts;
pub mod header;
pub mod navigation;
pub mod smart_table;

pub use ajax::AjaxPage;
pub use datepicker::{DatepickerPage, TargetDate};
pub use form_layouts::FormLayoutsPage;
pub use header::{HeaderPage, Theme};
pub use navigation::{MenuRoute, NavigationPage};
pub use smart_table::{Column, SmartTablePage};
