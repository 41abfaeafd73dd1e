#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

extern crate alloc;

mod utils;
pub(crate) use utils::helper;

mod traits;
pub use traits::{NodeId, OrderStatistics, SearchTree};

mod traversal;
pub use traversal::InOrder;

mod avl_tree;
pub use avl_tree::AvlTree;

mod rb_tree;
pub use rb_tree::RbTree;

mod baselines;
pub use baselines::{MinHeap, UnsortedArray};

#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
pub use error::IngestError;

#[cfg(feature = "std")]
pub mod ingest;
