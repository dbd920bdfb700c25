pub mod account_pool;
