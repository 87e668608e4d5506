pub mod keys;
pub mod option_set;

pub use keys::{
    JournalExtractOption, JournalLoadOption, OptionKey, OptionValue, Setting, ValueType,
};
pub use option_set::{ExtractOptions, LoadOptions, OptionSet};
