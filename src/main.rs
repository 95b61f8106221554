//! tabkeys console demo.
//!
//! Builds a simulated browser window and walks through the keyboard commands,
//! printing the strip after each step.

use std::error::Error;
use std::sync::Arc;

use tabkeys::app::App;
use tabkeys::clock::ManualClock;
use tabkeys::database::Database;
use tabkeys::host::{SimulatedBrowser, TabHost};
use tabkeys::types::command::Command;
use tabkeys::types::event::BrowserEvent;
use tabkeys::types::settings::EngineSettings;
use tabkeys::types::tab::{TabQuery, WindowId};

type DemoResult = Result<(), Box<dyn Error>>;

fn main() {
    tabkeys::logging::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 tabkeys v{} — Demo Mode                   ║", env!("CARGO_PKG_VERSION"));
    println!("║        Keyboard-driven tab ordering, pinning, grouping       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let demos: [(&str, fn() -> DemoResult); 5] = [
        ("Step moves and collapsed groups", demo_steps),
        ("Front/back snapping with toggle", demo_snaps),
        ("Move all groups", demo_groups),
        ("Blank-tab reuse", demo_blank_tabs),
        ("Switch to last tab", demo_history),
    ];

    let mut failed = 0;
    for (name, demo) in demos {
        section(name);
        if let Err(e) = demo() {
            println!("  ✗ {}", e);
            failed += 1;
        }
        println!();
    }

    println!("═══════════════════════════════════════════════════════════════");
    if failed == 0 {
        println!("  ✅ All {} demos completed.", demos.len());
    } else {
        println!("  ⚠ {} of {} demos failed.", failed, demos.len());
    }
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

/// One line per window: `P` pinned, `[gN]` grouped (`*` collapsed), `>` active.
fn strip(app: &App<SimulatedBrowser>, window_id: WindowId) -> String {
    let groups = app.host.query_groups(window_id);
    app.host
        .query_tabs(&TabQuery::window(window_id))
        .iter()
        .map(|t| {
            let mut label = t.title.clone();
            if t.pinned {
                label = format!("P:{}", label);
            }
            if let Some(g) = t.group_id {
                let collapsed = groups.iter().any(|gr| gr.id == g && gr.collapsed);
                label = format!("[g{}{}]{}", g, if collapsed { "*" } else { "" }, label);
            }
            if t.active {
                label = format!(">{}", label);
            }
            label
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn demo_steps() -> DemoResult {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    browser.add_pinned_tab(w, "https://mail.example")?;
    let t1 = browser.add_tab(w, "https://docs.example/1")?;
    let t2 = browser.add_tab(w, "https://docs.example/2")?;
    let t3 = browser.add_tab(w, "https://news.example")?;
    browser.add_group(&[t1, t2], true)?;
    browser.select(w, &[t3])?;

    let mut app = App::simulated(browser);
    println!("  before: {}", strip(&app, w));
    let report = app.run_command(Command::MoveTabsLeft, w)?;
    println!("  move-tabs-left issued {:?}", report.actions);
    println!("  after:  {}", strip(&app, w));
    app.run_command(Command::MoveTabsLeft, w)?;
    println!("  again:  {}", strip(&app, w));
    println!("  ✓ Collapsed group skipped, then tab pinned at the boundary");
    Ok(())
}

fn demo_snaps() -> DemoResult {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    browser.add_tab(w, "https://a.example")?;
    let b = browser.add_tab(w, "https://b.example")?;
    browser.select(w, &[b])?;

    let clock = ManualClock::new(1_000_000);
    let clipboard = browser.clipboard();
    let mut app = App::new(
        browser,
        Box::new(clipboard),
        Box::new(Database::open_in_memory()?),
        EngineSettings::default(),
        Arc::new(clock.clone()),
    );

    app.run_command(Command::MoveTabsToFront, w)?;
    println!("  first press:  {}", strip(&app, w));
    clock.advance(300);
    app.run_command(Command::MoveTabsToFront, w)?;
    println!("  second press: {}", strip(&app, w));
    clock.advance(300);
    app.run_command(Command::MoveTabsToBack, w)?;
    println!("  back:         {}", strip(&app, w));
    clock.advance(300);
    app.run_command(Command::MoveTabsToBack, w)?;
    println!("  back again:   {}", strip(&app, w));
    println!("  ✓ Repeat presses pinned and unpinned the tab");
    Ok(())
}

fn demo_groups() -> DemoResult {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    let a = browser.add_tab(w, "https://a.example")?;
    browser.add_tab(w, "https://b.example")?;
    let c = browser.add_tab(w, "https://c.example")?;
    browser.add_group(&[a], false)?;
    browser.add_group(&[c], false)?;

    let mut app = App::simulated(browser);
    println!("  before: {}", strip(&app, w));
    app.run_command(Command::MoveAllGroups, w)?;
    println!("  after:  {}", strip(&app, w));
    app.run_command(Command::MoveAllGroups, w)?;
    println!("  again:  {}", strip(&app, w));
    println!("  ✓ Groups gathered at the back, then at the front");
    Ok(())
}

fn demo_blank_tabs() -> DemoResult {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    browser.add_tab(w, "https://work.example")?;
    for _ in 0..3 {
        browser.add_tab(w, "chrome://newtab/")?;
    }

    let mut app = App::simulated(browser);
    println!("  before: {}", strip(&app, w));
    app.run_command(Command::OpenTabAtEnd, w)?;
    println!("  after:  {}", strip(&app, w));
    println!("  ✓ One blank tab left");
    Ok(())
}

fn demo_history() -> DemoResult {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    let a = browser.add_tab(w, "https://a.example")?;
    let b = browser.add_tab(w, "https://b.example")?;

    let clock = ManualClock::new(0);
    let clipboard = browser.clipboard();
    let mut app = App::new(
        browser,
        Box::new(clipboard),
        Box::new(tabkeys::database::MemoryStore::new()),
        EngineSettings::default(),
        Arc::new(clock.clone()),
    );

    for tab_id in [a, b] {
        app.host.select(w, &[tab_id])?;
        app.handle_event(&BrowserEvent::TabActivated { tab_id, window_id: w })?;
        clock.advance(1_500);
        app.confirm_due_activations()?;
    }
    println!("  history: {:?}", app.history()?.ids());
    app.run_command(Command::SwitchToLastTab, w)?;
    println!("  after switch: {}", strip(&app, w));
    println!("  ✓ Switched back to the previous tab");
    Ok(())
}
