//! Unit tests mirroring the `src/` tree one file per module

mod analysis;
mod io;
mod spatial;
