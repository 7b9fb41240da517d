mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod flag;
pub use flag::Flag;

mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{DEFAULT_NAMESPACE, LABEL_SESSION_ID, SESSION_NAME_PREFIX};
