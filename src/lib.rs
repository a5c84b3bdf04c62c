//! Core of a Lua 5.3 virtual machine: the binary chunk loader, the
//! instruction codec, the value stack and the fetch/addressing glue the
//! interpreter loop is built on.

pub mod binchunk;
pub mod diagnostic;
pub mod listing;
pub mod number;
pub mod state;
pub mod value;
pub mod vm;
