/// Parsing recurses once per nesting level, up to the parser's depth cap.
const THREAD_STACK_SIZE: usize = 32 * 1024 * 1024;

fn main() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(THREAD_STACK_SIZE)
        .build()?;
    runtime.block_on(source_lsp::run());
    Ok(())
}
