use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{Item, ItemUse};

use crate::annotation::ParsedRecord;
use crate::record_gen::generate_record;
use crate::GenerateOptions;

/// Generate the complete output for a set of parsed records.
pub fn generate_all(
    records: &[ParsedRecord],
    uses: &[ItemUse],
    options: &GenerateOptions,
) -> rqlmap::Result<TokenStream> {
    let mut tokens = TokenStream::new();

    // impls land next to the declarations, which already have their imports
    if !options.impls_only {
        for item in uses {
            item.to_tokens(&mut tokens);
        }
    }

    for record in records {
        log::debug!(
            "generating {} for table {}",
            record.schema.name,
            record.schema.table
        );
        tokens.extend(generate_record(record, &options.tag, options.impls_only)?);
    }

    Ok(tokens)
}

/// Append the `use` items of a source file, skipping ones already seen.
pub fn collect_uses(file: &syn::File, uses: &mut Vec<ItemUse>) {
    for item in &file.items {
        if let Item::Use(item) = item {
            let text = quote!(#item).to_string();
            if !uses.iter().any(|seen| quote!(#seen).to_string() == text) {
                uses.push(item.clone());
            }
        }
    }
}

/// The first line of every generated file.
pub fn header(tool_name: &str) -> String {
    format!("// generated by {}; DO NOT EDIT", tool_name)
}

/// Format a token stream as pretty-printed Rust source under `header`.
pub fn format_token_stream(tokens: &TokenStream, header: &str) -> Result<String, syn::Error> {
    let file: syn::File = syn::parse2(tokens.clone())?;
    Ok(format!("{}\n\n{}", header, prettyplease::unparse(&file)))
}
