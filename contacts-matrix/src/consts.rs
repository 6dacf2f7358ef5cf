use crate::average::AverageMethod;

pub const DEFAULT_OUT: &str = "averaged-contacts.mtx.gz";
pub const DEFAULT_METHOD: AverageMethod = AverageMethod::Sum;
pub const MTX_EXTENSIONS: [&str; 2] = ["mtx", "mtx.gz"];
pub const MTX_BANNER: &str = "%%MatrixMarket";
pub const NPZ_EXTENSION: &str = "npz";
pub const NPZ_FORMAT_ENTRY: &str = "format";
pub const NPY_MAGIC: &[u8] = b"\x93NUMPY";
pub const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";
