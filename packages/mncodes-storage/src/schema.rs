pub fn render_schema(vector_dim: u32) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_jurisdictions.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_jurisdictions.sql")),
				"tables/002_base_codes.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_base_codes.sql")),
				"tables/003_code_sections.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_code_sections.sql")),
				"tables/004_local_amendments.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_local_amendments.sql")),
				"tables/005_code_section_embeddings.sql" => out
					.push_str(include_str!("../../../sql/tables/005_code_section_embeddings.sql")),
				"tables/006_permit_types.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_permit_types.sql")),
				"tables/007_permit_fee_schedules.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_permit_fee_schedules.sql")),
				"tables/008_inspection_types.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_inspection_types.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
