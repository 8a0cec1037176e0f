//! PayMongo adapters.

mod checkout_adapter;
mod mock_payment_provider;

pub use checkout_adapter::{
    CheckoutSettings, PayMongoCheckoutAdapter, PayMongoConfig, DEFAULT_PAYMONGO_API_BASE_URL,
};
pub use mock_payment_provider::MockPaymentProvider;
