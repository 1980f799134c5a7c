pub mod client;
pub mod error;
pub mod model;

pub use client::QuotesInfoApi;
pub use error::QuotesInfoError;
pub use model::{
    NewQuote, NewUser, Page, PageRequest, Quote, QuoteFilter, QuotePatch, User, UserFilter,
    UserPatch,
};
