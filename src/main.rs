fn main() -> anyhow::Result<()> {
    voice_studio_lib::run()
}
