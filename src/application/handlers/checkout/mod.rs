//! Checkout handlers.

mod create_checkout;

pub use create_checkout::{
    CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult,
};
