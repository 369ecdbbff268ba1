mod key;
mod level;

pub use key::AdminKey;
pub use level::AdminLevel;
