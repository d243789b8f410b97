/*!
Types and routines that support the automatons in this crate.

Most of what lives here is re-exported at the crate root. The [`pool`]
module is only public so that its documentation and examples are visible.
*/

pub mod alphabet;
pub mod id;
pub mod iter;
pub mod pool;
pub mod search;
