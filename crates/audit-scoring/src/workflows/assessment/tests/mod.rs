mod common;
mod compliance;
mod session;
