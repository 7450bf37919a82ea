//! JSON servers returning the desk operations over HTTP. Each version binds
//! one desk behind a mutex, so a server instance carries a single session the
//! way one browser tab does.
pub mod desk_v1;
