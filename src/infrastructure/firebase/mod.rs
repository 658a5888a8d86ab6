//! Firebase backend over its public REST APIs.
//!
//! - Identity Toolkit for email/password sign-in and password changes
//! - Firestore `documents` / `runQuery` for data, polled for live queries
//! - Firebase Storage for photo uploads

pub mod client;
pub mod firestore;
pub mod identity;
pub mod storage;
pub mod value;

pub use client::FirebaseClient;
pub use firestore::FirestoreDocumentStore;
pub use identity::FirebaseIdentityProvider;
pub use storage::FirebaseBlobStore;
