//! Client implementations of the desk API, as much documentation of how to
//! call the server as a library in their own right.
pub mod desk_v1;
