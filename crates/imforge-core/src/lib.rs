//! imforge core crate.
//!
//! Small shared pieces used by the designer and the studio front end:
//! canvas-space geometry, packed colours and logger initialization.

pub mod coords;
pub mod logging;
