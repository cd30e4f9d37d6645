//! Scripted four-tab application driving the navigation controller

mod app;
mod screens;

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use log::info;

use app::DemoApp;
use stacknav::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Deferred cross-tab navigation and tab back handling
    Tabs,
    /// Single-instance screen replacement
    Singleton,
    /// Back presses bypassing a skip-on-pop screen
    SkipOnPop,
    /// Dialog result delivery
    Dialog,
    /// Every scenario, each on a fresh application
    All,
}

impl Scenario {
    fn title(&self) -> &'static str {
        match self {
            Scenario::Tabs => "Tabs",
            Scenario::Singleton => "Singleton",
            Scenario::SkipOnPop => "Skip on pop",
            Scenario::Dialog => "Dialog",
            Scenario::All => "All",
        }
    }
}

pub async fn run(scenario: Scenario, config: &Config) -> Result<()> {
    let scenarios = match scenario {
        Scenario::All => vec![
            Scenario::Tabs,
            Scenario::Singleton,
            Scenario::SkipOnPop,
            Scenario::Dialog,
        ],
        single => vec![single],
    };

    for scenario in scenarios {
        info!("Playing scenario {:?}", scenario);
        println!("{}", format!("== {} ==", scenario.title()).bright_blue().bold());

        let mut app = DemoApp::new(config);
        match scenario {
            Scenario::Tabs => app::play_tabs(&mut app).await?,
            Scenario::Singleton => app::play_singleton(&mut app).await?,
            Scenario::SkipOnPop => app::play_skip_on_pop(&mut app).await?,
            Scenario::Dialog => app::play_dialog(&mut app).await?,
            Scenario::All => {}
        }
    }
    Ok(())
}
