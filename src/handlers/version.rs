pub fn handle_version() -> crate::Result<()> {
    println!("omc {}", crate::VERSION);
    Ok(())
}
