//! Lowers a resolved, class-based program into portable C targeting a
//! GObject-style runtime.
//!
//! The pipeline mirrors the teacher's own staged design: a [`model::Context`]
//! arrives already parsed and name-bound, gets its expression and statement
//! trees annotated by [`resolver`], then [`emit`] turns every namespace into
//! GObject boilerplate plus the plain C lowering of its method bodies. A
//! [`driver::Driver`] walks every compilation unit in the context end to
//! end and hands back the finished `.h`/`.c` pairs.
//!
//! ```text
//! Context (front-end output)
//!   -> resolver            fills ResolvedInfo / method_cdecl side tables
//!   -> emit::declaration    GObject scaffolding, one class/struct/enum at a time
//!   -> emit::dependency     #include / forward-declare decisions per unit
//!   -> driver               ties it together into EmittedFile pairs
//! ```

pub mod arena;
pub mod cname;
pub mod driver;
pub mod emit;
pub mod error;
pub mod location;
pub mod model;
pub mod resolver;

pub use driver::{Driver, EmittedFile};
pub use error::{CodeSpanReportGenerator, CodegenError, ReportGenerator};
pub use model::Context;
