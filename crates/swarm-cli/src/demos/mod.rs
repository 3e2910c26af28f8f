//! Demo programs, one module per subcommand family

pub mod locks;
pub mod pi;
pub mod promise;
pub mod workers;
