use tendril_core::{vec2, SpeedProfile};
use tendril_world::{WorldBuilder, WorldConfig};

fn main() {
    let mut w = WorldBuilder::new()
        .with_config(WorldConfig::spider())
        .with_profile(SpeedProfile::Fast)
        .with_viewport(800.0, 600.0)
        .build()
        .expect("preset config is valid");

    // pointer circling the middle of the screen
    for step in 0..120u32 {
        let a = step as f32 * 0.05;
        let p = vec2(400.0, 300.0) + vec2(a.cos(), a.sin()) * 220.0;
        w.set_external_target(p.x, p.y);
        let stats = w.step();
        let hash = w.step_hash();
        println!(
            "step {step:03}  stepping={}/{}  residual={:.4}  hash={:02x?}",
            stats.stepping, stats.appendages, stats.max_residual, &hash[..8]
        );
    }
}
