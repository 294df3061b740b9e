use proc_macro2::{Ident, TokenStream};
use quote::{quote, ToTokens};
use rqlmap::schema::SchemaModel;
use syn::{Fields, ItemStruct};

use crate::annotation::{is_annotation, ParsedRecord};
use crate::type_utils::{list_alias_ident, safe_field_ident};

/// Generate the items for one record type: the cleaned struct (unless
/// `impls_only`), its list alias and its `Record` impl.
pub fn generate_record(
    record: &ParsedRecord,
    tag: &str,
    impls_only: bool,
) -> rqlmap::Result<TokenStream> {
    let mut tokens = TokenStream::new();
    if !impls_only {
        strip_annotations(&record.item, tag).to_tokens(&mut tokens);
    }
    tokens.extend(generate_list_alias(&record.item));
    tokens.extend(generate_record_impl(&record.schema, &record.item)?);
    Ok(tokens)
}

/// The declaration with every generator annotation removed from its fields.
pub fn strip_annotations(item: &ItemStruct, tag: &str) -> ItemStruct {
    let mut item = item.clone();
    if let Fields::Named(fields) = &mut item.fields {
        for field in fields.named.iter_mut() {
            field.attrs.retain(|attr| !is_annotation(attr, tag));
        }
    }
    item
}

fn generate_list_alias(item: &ItemStruct) -> TokenStream {
    let vis = &item.vis;
    let ident = &item.ident;
    let alias = list_alias_ident(&ident.to_string());
    let params = &item.generics.params;
    let (_, ty_generics, _) = item.generics.split_for_impl();
    let doc = format!(" A list of [`{}`] records", ident);
    if params.is_empty() {
        quote! {
            #[doc = #doc]
            #vis type #alias = Vec<#ident>;
        }
    } else {
        quote! {
            #[doc = #doc]
            #vis type #alias<#params> = Vec<#ident #ty_generics>;
        }
    }
}

fn idents<'a>(fields: impl Iterator<Item = &'a str>) -> Vec<Ident> {
    fields.map(safe_field_ident).collect()
}

fn generate_record_impl(schema: &SchemaModel, item: &ItemStruct) -> rqlmap::Result<TokenStream> {
    let ident = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let table = &schema.table;
    let key_names = schema.key_names();
    let key_fields = schema.key_fields();
    let key_idents = idents(schema.key_columns.iter().map(|c| c.field.as_str()));
    let names: Vec<&str> = schema.select_columns().map(|c| c.field.as_str()).collect();
    let select_idents = idents(names.iter().copied());
    let receiver_count = select_idents.len();
    let insert_idents = idents(schema.insert_columns().map(|c| c.field.as_str()));
    let select_fields = schema.select_fields();
    let insert_fields = schema.insert_fields();
    let sql_create = schema.create_table_sql()?;

    let primary = match (schema.single_integer_primary, key_idents.first()) {
        (true, Some(id)) => quote! {
            fn primary(&self) -> Option<i64> {
                match rqlmap::ToValue::to_value(&self.#id) {
                    rqlmap::Value::Integer(id) => Some(id),
                    _ => Some(0),
                }
            }

            fn set_primary(&mut self, id: i64) {
                rqlmap::record::assign_identity(&mut self.#id, #table, id);
            }
        },
        _ => quote! {
            fn primary(&self) -> Option<i64> {
                None
            }

            fn set_primary(&mut self, _id: i64) {}
        },
    };

    Ok(quote! {
        impl #impl_generics rqlmap::Record for #ident #ty_generics #where_clause {
            fn table_name(&self) -> &'static str {
                #table
            }

            fn key_names(&self) -> &'static [&'static str] {
                &[#(#key_names),*]
            }

            fn key_fields(&self) -> &'static [&'static str] {
                &[#(#key_fields),*]
            }

            fn key_values(&self) -> Vec<rqlmap::Value> {
                vec![#(rqlmap::ToValue::to_value(&self.#key_idents)),*]
            }

            fn names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn select_fields(&self) -> &'static str {
                #select_fields
            }

            fn insert_fields(&self) -> &'static str {
                #insert_fields
            }

            fn insert_values(&self) -> Vec<rqlmap::Value> {
                vec![#(rqlmap::ToValue::to_value(&self.#insert_idents)),*]
            }

            fn update_values(&self) -> Vec<rqlmap::Value> {
                let mut values = self.insert_values();
                values.extend(self.key_values());
                values
            }

            fn receivers(&mut self) -> Vec<&mut dyn rqlmap::Receiver> {
                let mut receivers: Vec<&mut dyn rqlmap::Receiver> = Vec::with_capacity(#receiver_count);
                #(receivers.push(&mut self.#select_idents);)*
                receivers
            }

            #primary

            fn sql_create(&self) -> &'static str {
                #sql_create
            }
        }
    })
}
