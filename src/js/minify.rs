//! Script minification using oxc: mangle, compress, minified codegen.
//! No source map is emitted for scripts.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::error::PipelineError;

/// Minify JavaScript source code.
pub fn minify_js(path: &Path, source: &str) -> Result<String, PipelineError> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(PipelineError::transform(path, error.to_string()));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_minify_strips_comments_and_whitespace() {
        let source = "// banner\nfunction add(first, second) {\n  return first + second;\n}\nexport { add };\n";
        let out = minify_js(Path::new("app.js"), source).unwrap();
        assert!(!out.contains("banner"));
        assert!(out.len() < source.len());
    }

    #[test]
    fn test_minify_is_stable_on_minified_input() {
        let source = "const greet=(name)=>{console.log(`hi ${name}`)};greet(\"x\");\n";
        let once = minify_js(Path::new("app.js"), source).unwrap();
        let twice = minify_js(Path::new("app.min.js"), &once).unwrap();
        // Re-minifying minified output must not grow it
        assert!(twice.len() <= once.len());
    }

    #[test]
    fn test_minify_syntax_error_is_transform() {
        let err = minify_js(Path::new("app.js"), "function (").unwrap_err();
        assert!(err.is_transform());
    }
}
