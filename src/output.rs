/// Print a Serialize value as one compact JSON line on stdout.
///
/// Stdout carries nothing but this line; callers parse it, so diagnostics
/// belong on stderr.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json_line(value: &(impl serde::Serialize + ?Sized)) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| anyhow::anyhow!("could not serialize output payload: {e}"))?;
    println!("{json}");
    Ok(())
}
