use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::comment::CommentExtractor;
use crate::config::StyleguideConfig;
use crate::document::StyleguideDocument;
use crate::error::Result;
use crate::indexer::assembler::MultiBlockAssembler;
use crate::indexer::walker::{FileWalker, DEFAULT_EXTENSIONS};
use crate::section::{ArgumentParser, BlockParser, Section};

/// Entry point: discover stylesheets, parse their comments, assemble a document
pub struct Parser {
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
    patterns: Vec<String>,
    variables: Vec<(String, String)>,
    block_parser: BlockParser,
}

impl Parser {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            patterns: Vec::new(),
            variables: Vec::new(),
            block_parser: BlockParser::new(),
        }
    }

    pub fn from_config(config: &StyleguideConfig) -> Self {
        let mut parser = Self::new(config.paths.iter().cloned())
            .with_patterns(config.patterns.iter().cloned())
            .with_variables(config.variables.to_vec());
        if !config.extensions.is_empty() {
            parser = parser.with_extensions(config.extensions.iter().cloned());
        }
        parser
    }

    /// Replaces the default extension set
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Literal substitutions applied to comment text, in the given order
    pub fn with_variables(mut self, variables: Vec<(String, String)>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_argument_parser(mut self, argument_parser: Arc<dyn ArgumentParser>) -> Self {
        self.block_parser = BlockParser::with_argument_parser(argument_parser);
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn find_files(&self) -> Result<Vec<PathBuf>> {
        FileWalker::with_filters(&self.extensions, &self.patterns)?.walk_all(&self.paths)
    }

    pub fn parse(&self) -> Result<StyleguideDocument> {
        let files = self.find_files()?;
        tracing::debug!("Found {} stylesheet files", files.len());

        let extractor = CommentExtractor::with_variables(self.variables.clone());
        let per_file: Vec<Result<Vec<Section>>> = files
            .par_iter()
            .map(|path| self.parse_file(&extractor, path))
            .collect();

        let mut assembler = MultiBlockAssembler::new();
        for sections in per_file {
            assembler.add_all(sections?)?;
        }
        assembler.finish()
    }

    /// Same pipeline over in-memory `(filename, text)` pairs
    pub fn parse_sources<N, T>(&self, sources: &[(N, T)]) -> Result<StyleguideDocument>
    where
        N: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let extractor = CommentExtractor::with_variables(self.variables.clone());
        let per_source: Vec<Result<Vec<Section>>> = sources
            .par_iter()
            .map(|(name, text)| self.parse_source(&extractor, name.as_ref(), text.as_ref()))
            .collect();

        let mut assembler = MultiBlockAssembler::new();
        for sections in per_source {
            assembler.add_all(sections?)?;
        }
        assembler.finish()
    }

    fn parse_file(&self, extractor: &CommentExtractor, path: &Path) -> Result<Vec<Section>> {
        let source = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        self.parse_source(extractor, &filename, &source)
    }

    fn parse_source(
        &self,
        extractor: &CommentExtractor,
        filename: &str,
        source: &str,
    ) -> Result<Vec<Section>> {
        let blocks = extractor.extract_blocks(filename, source);
        tracing::debug!("{}: {} comment blocks", filename, blocks.len());

        blocks
            .iter()
            .map(|block| self.block_parser.parse(block))
            .collect()
    }
}
