fn main() -> anyhow::Result<()> {
    shaderswap_demo::run(shaderswap_demo::Variant::fractal())
}
