//! Utils

use clap::Parser;

/// Arguments for the order flow demos
#[derive(Debug, Parser)]
pub struct DemoOrderArgs {
    /// Fixture set to load the catalog from
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Restaurant to order from
    #[clap(short, long, default_value = "Tony's Pizza Palace")]
    pub restaurant: String,

    /// Quantity of each ordered dish
    #[clap(short = 'n', long, default_value_t = 1)]
    pub quantity: u32,
}
