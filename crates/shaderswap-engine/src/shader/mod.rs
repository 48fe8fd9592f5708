//! Custom shader programs and the per-context slots they are installed into.
//!
//! A drawing context has one slot per [`ShaderKind`]. Installing a program
//! returns a [`ShaderRestore`] token holding whatever was active before;
//! handing the token back restores it. Tokens must be returned in LIFO order.

mod blob;
mod error;
mod id;
mod interface;
mod kind;
mod program;
mod slots;

pub use blob::{ShaderBlob, SPIRV_MAGIC};
pub use error::ShaderError;
pub use id::{ContextId, ShaderId};
pub use kind::ShaderKind;
pub use program::{ProgramRestore, ShaderProgram};
pub use slots::{BoundShader, ShaderRestore, ShaderSlots};
