pub mod anniversary;
pub mod backend;
pub mod direct;
pub mod dispatcher;
pub mod firestore;
pub mod store;
pub mod token;
pub mod transport;
pub mod webpush;
