fn main() {
    println!("cargo:rerun-if-changed=schema/records.rs");
    rqlmap_codegen::generate_from_sources(
        &["schema/records.rs"],
        format!("{}/records.rs", std::env::var("OUT_DIR").unwrap()),
        &rqlmap_codegen::GenerateOptions {
            tool_name: "basic-crud/build.rs".to_string(),
            ..Default::default()
        },
    )
    .expect("Code generation failed");
}
