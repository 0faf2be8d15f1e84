use crate::node::SourceFile;
use crate::type_checker::{InMemoryTypeChecker, TypeChecker};
use std::sync::Arc;

pub trait Program: Send + Sync {
    fn get_root_file_names(&self) -> Vec<String>;
    fn get_source_files(&self) -> &[Arc<SourceFile>];
    fn get_type_checker(&self) -> &dyn TypeChecker;

    fn get_source_file(&self, file_name: &str) -> Option<&Arc<SourceFile>> {
        self.get_source_files()
            .iter()
            .find(|f| f.file_name() == file_name)
    }
}

/// A program assembled from already-parsed files and a precomputed semantic model.
#[derive(Debug)]
pub struct InMemoryProgram {
    files: Vec<Arc<SourceFile>>,
    checker: InMemoryTypeChecker,
}

impl InMemoryProgram {
    /// Indexes every file's declarations into the checker.
    pub fn new(files: Vec<SourceFile>, mut checker: InMemoryTypeChecker) -> Self {
        let files: Vec<Arc<SourceFile>> = files.into_iter().map(Arc::new).collect();
        for file in &files {
            checker.index_file(file);
        }
        Self { files, checker }
    }
}

impl Program for InMemoryProgram {
    fn get_root_file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.file_name().to_string()).collect()
    }

    fn get_source_files(&self) -> &[Arc<SourceFile>] {
        &self.files
    }

    fn get_type_checker(&self) -> &dyn TypeChecker {
        &self.checker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ClassDeclaration, Declaration, Identifier, Span};
    use crate::type_checker::{SymbolFlags, Type, TypeFormatFlags};

    fn class_file(file: &str, name: &str) -> SourceFile {
        let text = format!("export class {} {{}}", name);
        let class = ClassDeclaration {
            name: Some(Identifier::new(name, Span::new(13, 13 + name.len()))),
            span: Span::new(7, text.len()),
            ..Default::default()
        };
        SourceFile::new(file, text, vec![Declaration::Class(Arc::new(class))])
    }

    #[test]
    fn should_prefer_same_file_declaration() {
        let program = InMemoryProgram::new(
            vec![class_file("/a.ts", "Base"), class_file("/b.ts", "Base")],
            InMemoryTypeChecker::new(),
        );
        let checker = program.get_type_checker();
        let symbol = checker
            .get_symbol_at_location("/b.ts", &Identifier::new("Base", Span::default()))
            .unwrap();
        assert_eq!(symbol.declarations[0].file_name, "/b.ts");
        assert!(symbol.flags.contains(SymbolFlags::CLASS));
    }

    #[test]
    fn should_default_untyped_nodes_to_any() {
        let program = InMemoryProgram::new(vec![class_file("/a.ts", "A")], InMemoryTypeChecker::new());
        let ty = program.get_type_checker().get_type_at_location("/a.ts", Span::new(0, 1));
        assert_eq!(ty, Type::any());
    }

    #[test]
    fn should_report_line_ranges() {
        let file = SourceFile::new("/a.ts", "a\nbb\nccc", vec![]);
        let range = file.line_range(Span::new(2, 6));
        assert_eq!((range.start_line, range.end_line), (2, 3));
        assert_eq!(file.text_of(Span::new(2, 4)), "bb");
    }

    #[test]
    fn should_truncate_long_types_unless_asked_not_to() {
        let checker = InMemoryTypeChecker::new();
        let long = Type::object("x".repeat(200));
        assert!(checker.type_to_string(&long, TypeFormatFlags::NONE).ends_with("..."));
        assert_eq!(
            checker.type_to_string(&long, TypeFormatFlags::NO_TRUNCATION).len(),
            200
        );
    }
}
