mod nom_parser;
mod types;

pub use self::nom_parser::ParsedMessage;
pub use self::types::Message;
