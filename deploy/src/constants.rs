//! Constants used by the token deployment

/// The contract deployed when no other name is given
pub const DEFAULT_CONTRACT_NAME: &str = "SinsoToken";

/// Placeholder owner handed to the token constructor
pub const OWNER_PLACEHOLDER: &str = "0xx";

/// Initial token supply handed to the token constructor, 10^26 base units
pub const INITIAL_SUPPLY: &str = "100000000000000000000000000";

/// The constructor arguments of every deployment, in declaration order
pub const CONSTRUCTOR_ARGS: [&str; 2] = [OWNER_PLACEHOLDER, INITIAL_SUPPLY];

/// Directory of compiled artifacts that are never blueprints
pub const BUILD_INFO_DIR: &str = "build-info";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
