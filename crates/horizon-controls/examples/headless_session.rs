//! Headless control session.
//!
//! Builds a small control tree, replays a scripted pointer against it on a
//! manual clock, and prints what the widgets saw and drew. No window or GPU
//! is involved.
//!
//! Run with: cargo run -p horizon-controls --example headless_session

use std::sync::Arc;
use std::time::Duration;

use horizon_controls::input::PointerState;
use horizon_controls::prelude::*;

/// Canvas that prints every draw call.
struct PrintCanvas;

impl Canvas for PrintCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        println!(
            "  fill   ({:>5.1}, {:>5.1}) {:>5.1}x{:<5.1} rgba({:.2}, {:.2}, {:.2}, {:.2})",
            rect.origin.x, rect.origin.y, rect.size.width, rect.size.height,
            color.r, color.g, color.b, color.a
        );
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color, width: f32) {
        println!(
            "  stroke ({:>5.1}, {:>5.1}) {:>5.1}x{:<5.1} width {width}",
            rect.origin.x, rect.origin.y, rect.size.width, rect.size.height
        );
    }
}

fn main() -> horizon_controls::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("Headless control session");
    println!("========================");
    println!();

    let config = ManagerConfig::from_toml_str("pointer_offset = [0.0, 0.0]\n")?;
    let clock = Arc::new(ManualClock::new());
    let mut manager = ControlManager::with_clock(config, clock.clone());

    let toolbar = manager.add(
        Panel::new()
            .with_name("toolbar")
            .with_bounds(Rect::new(10.0, 10.0, 200.0, 40.0))
            .with_background(Color::from_rgb8(40, 44, 52)),
    )?;
    let button = manager.add_to(
        toolbar,
        PushButton::new("Run").with_bounds(Rect::new(5.0, 5.0, 60.0, 30.0)),
    )?;
    let switch = manager.add_to(
        toolbar,
        SwitchBox::new(SwitchBoxKind::Big).with_position(Point::new(100.0, 10.0)),
    )?;

    if let Some(push) = manager.tree().get::<PushButton>(button) {
        push.clicked.connect(|_| println!("> Run clicked"));
    }
    if let Some(switch_box) = manager.tree().get::<SwitchBox>(switch) {
        switch_box
            .toggled
            .connect(|on| println!("> switch is now {}", if *on { "on" } else { "off" }));
    }

    println!("{}", manager.dump());

    // Hover the button, click it, then click the switch track.
    let mut pointer = ScriptedPointer::new();
    let over_button = PointerState::new(Point::new(30.0, 30.0));
    let over_switch = PointerState::new(Point::new(160.0, 28.0));
    pointer
        .push(over_button)
        .push(over_button.with_button(MouseButton::Left, true))
        .push(over_button)
        .push(over_switch)
        .push(over_switch.with_button(MouseButton::Left, true))
        .push(over_switch);

    while pointer.remaining() > 0 {
        manager.tick(&mut pointer, &mut ());
        clock.advance(Duration::from_millis(16));
    }

    // Let the animations settle.
    for _ in 0..30 {
        manager.tick(&mut pointer, &mut ());
        clock.advance(Duration::from_millis(16));
    }

    println!();
    println!("focused: {:?}", manager.keyboard_control());
    println!("draw list:");
    manager.draw(&mut PrintCanvas);
    Ok(())
}
