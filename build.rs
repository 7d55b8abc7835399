use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata behind `chat-server --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
