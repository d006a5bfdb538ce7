//! Identifier usage collection.
//!
//! Usage is tracked by name, not by scope: a name referenced anywhere in the
//! file counts as used for every binding of that name.
//!
//! # Components
//!
//! - `declarations`: identifiers that name a declaration rather than use one
//! - `collector`: the set of names referenced outside import declarations

pub mod collector;
pub mod declarations;

pub use collector::UsedNameSet;
pub use declarations::{binding_idents, DeclarationSites};
