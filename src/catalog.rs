//! Catalog of upstream capability groups.
//!
//! Every operation exposed by the proxy belongs to exactly one [`Module`].
//! The catalog is closed: the set of modules is fixed at compile time and
//! tag lists are resolved against it by display name.

use std::fmt;

/// A named capability group that can be shown or hidden as a unit.
pub trait Capability: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Display name, matched exactly against include/exclude tags.
    fn name(&self) -> &'static str;

    /// One-line description used in the rendered API documentation.
    fn description(&self) -> &'static str;
}

/// Capability groups of the Interactive Brokers Client Portal Web API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Module {
    /// Price, time and margin alerts.
    Alerts,
    /// Instrument search and contract details.
    Contract,
    /// Event contracts.
    EventsContracts,
    /// Financial Advisor allocation groups.
    FaAllocationManagement,
    /// Notifications and disclaimers.
    FyisAndNotifications,
    /// Live and historical market data.
    MarketData,
    /// Option chains.
    OptionsChains,
    /// Live order status and trades.
    OrderMonitoring,
    /// Order placement.
    Orders,
    /// Portfolio positions and summaries.
    Portfolio,
    /// Portfolio Analyst performance data.
    PortfolioAnalyst,
    /// iServer and HMDS market scanners.
    Scanner,
    /// Authentication session.
    Session,
    /// Watchlists.
    Watchlists,
}

impl Module {
    /// Full catalog, in declaration order.
    pub const ALL: [Module; 14] = [
        Module::Alerts,
        Module::Contract,
        Module::EventsContracts,
        Module::FaAllocationManagement,
        Module::FyisAndNotifications,
        Module::MarketData,
        Module::OptionsChains,
        Module::OrderMonitoring,
        Module::Orders,
        Module::Portfolio,
        Module::PortfolioAnalyst,
        Module::Scanner,
        Module::Session,
        Module::Watchlists,
    ];

    /// Looks up a module by its exact display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|module| module.name() == name)
    }
}

impl Capability for Module {
    fn name(&self) -> &'static str {
        match self {
            Self::Alerts => "Alerts",
            Self::Contract => "Contract",
            Self::EventsContracts => "Events Contracts",
            Self::FaAllocationManagement => "FA Allocation Management",
            Self::FyisAndNotifications => "FYIs & Notifications",
            Self::MarketData => "Market Data",
            Self::OptionsChains => "Options Chains",
            Self::OrderMonitoring => "Order Monitoring",
            Self::Orders => "Orders",
            Self::Portfolio => "Portfolio",
            Self::PortfolioAnalyst => "Portfolio Analyst",
            Self::Scanner => "Scanner",
            Self::Session => "Session",
            Self::Watchlists => "Watchlists",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Alerts => "Create, modify, delete, and monitor price, time, and margin alerts.",
            Self::Contract => {
                "Search for and retrieve detailed information on financial instruments including stocks, options, futures, and bonds."
            }
            Self::EventsContracts => {
                "Get details on contracts that settle based on the outcome of future events."
            }
            Self::FaAllocationManagement => {
                "Manage Financial Advisor allocation groups for trade distribution."
            }
            Self::FyisAndNotifications => {
                "Manage and retrieve notifications, disclaimers, and delivery options."
            }
            Self::MarketData => {
                "Access live and historical market data, including snapshots, history, and deep history from HMDS."
            }
            Self::OptionsChains => "Retrieve full option chains for underlying symbols.",
            Self::OrderMonitoring => {
                "Check the status of live orders and view a list of recent trades."
            }
            Self::Orders => "Place, preview, modify, and cancel trading orders.",
            Self::Portfolio => {
                "Get detailed information about account portfolios, including positions, allocation, summaries, and performance."
            }
            Self::PortfolioAnalyst => {
                "Access performance data and transaction history for accounts."
            }
            Self::Scanner => {
                "Run market scanners on both iServer and the Historical Market Data Service (HMDS)."
            }
            Self::Session => {
                "Manage the user's authentication session, including status checks, re-authentication, and logout."
            }
            Self::Watchlists => {
                "Create, delete, and manage watchlists and the contracts within them."
            }
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
