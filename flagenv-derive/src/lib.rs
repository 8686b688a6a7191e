mod ast;
mod emit;
mod parse;

/// Derives `flagenv::Config` for a struct with named fields.
///
/// Field attributes: `#[config(flag = "..", env = "..", help = "..", def = "..")]`.
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Stub out the code, but let rust-analyzer resolve the invocation
    #[cfg(not(test))]
    {
        let text = match parse::config(_ts) {
            Ok(record) => emit::emit(&record),
            Err(err) => format!("compile_error!({:?});", format!("invalid Config derive, {err}")),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let record = parse::config(ts).unwrap();
    emit::emit(&record)
}
