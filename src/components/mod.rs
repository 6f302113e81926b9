pub mod region_picker;
pub mod search_form;
pub mod title_header;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use region_picker::{RegionPicker, RegionPickerProps};
pub use search_form::{SearchFormProps, SearchFormView};
pub use title_header::{TitleHeader, TitleHeaderProps};
