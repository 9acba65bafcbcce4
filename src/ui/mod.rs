pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, missing, resource_heading, success, translation, warn};
pub use table::{StringsTable, stats_table};
pub use theme::{theme, Theme};
