use proc_macro2::Ident;
use quote::format_ident;
use rqlmap::schema::ColumnType;
use syn::{GenericArgument, PathArguments, Type};

/// Bare name of a field type, looking through references and `Option<T>`.
/// e.g. `Option<chrono::DateTime<Utc>>` -> "DateTime", `&str` -> "str"
pub fn type_base_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Reference(r) => type_base_name(&r.elem),
        Type::Paren(p) => type_base_name(&p.elem),
        Type::Group(g) => type_base_name(&g.elem),
        Type::Path(p) => {
            let segment = p.path.segments.last()?;
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return type_base_name(inner);
                    }
                }
            }
            Some(segment.ident.to_string())
        }
        _ => None,
    }
}

/// SQL type class of a field type. Unknown shapes are text.
pub fn column_type(ty: &Type) -> ColumnType {
    type_base_name(ty)
        .map(|name| ColumnType::infer(&name))
        .unwrap_or_default()
}

/// `User` -> `UserList`
pub fn list_alias_ident(type_name: &str) -> Ident {
    format_ident!("{}List", type_name)
}

/// Identifier for a declared field name, using raw syntax for keywords.
pub fn safe_field_ident(name: &str) -> Ident {
    match name {
        "type" | "struct" | "enum" | "fn" | "let" | "mut" | "ref" | "mod" | "use" | "pub"
        | "impl" | "trait" | "for" | "loop" | "while" | "if" | "else" | "match" | "return"
        | "break" | "continue" | "as" | "in" | "where" | "async" | "await" | "dyn" | "move"
        | "static" | "const" | "unsafe" | "extern" | "true" | "false" | "abstract"
        | "become" | "box" | "do" | "final" | "macro" | "override" | "priv" | "typeof"
        | "unsized" | "virtual" | "yield" | "try" => format_ident!("r#{}", name),
        _ => format_ident!("{}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(src: &str) -> Type {
        syn::parse_str(src).unwrap()
    }

    #[test]
    fn test_type_base_name() {
        assert_eq!(type_base_name(&ty("String")).as_deref(), Some("String"));
        assert_eq!(type_base_name(&ty("&'static str")).as_deref(), Some("str"));
        assert_eq!(
            type_base_name(&ty("Option<chrono::DateTime<chrono::Utc>>")).as_deref(),
            Some("DateTime")
        );
        assert_eq!(type_base_name(&ty("(i64, i64)")), None);
    }

    #[test]
    fn test_column_type() {
        assert_eq!(column_type(&ty("i64")), ColumnType::Integer);
        assert_eq!(column_type(&ty("Option<u32>")), ColumnType::Integer);
        assert_eq!(column_type(&ty("NaiveDateTime")), ColumnType::Datetime);
        assert_eq!(column_type(&ty("String")), ColumnType::Text);
        assert_eq!(column_type(&ty("f64")), ColumnType::Text);
        assert_eq!(column_type(&ty("[u8; 4]")), ColumnType::Text);
    }

    #[test]
    fn test_list_alias_ident() {
        assert_eq!(list_alias_ident("TestStruct").to_string(), "TestStructList");
    }

    #[test]
    fn test_safe_field_ident() {
        assert_eq!(safe_field_ident("type").to_string(), "r#type");
        assert_eq!(safe_field_ident("name").to_string(), "name");
    }
}
