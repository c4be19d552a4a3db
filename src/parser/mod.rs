pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{parse_csv_reader, parse_file, parse_json_reader, ParseOutput};
pub use types::{PanelRaw, PanelRecord, ParseWarning};
