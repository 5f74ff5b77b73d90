pub mod comment;
pub mod config;
pub mod document;
pub mod error;
pub mod indexer;
pub mod markdown;
pub mod section;
pub mod tree;

pub use comment::{CommentExtractor, RawCommentBlock};
pub use config::{StyleguideConfig, VariableMap, CONFIG_FILENAME};
pub use document::StyleguideDocument;
pub use error::{KssError, Result};
pub use indexer::{assemble, FileWalker, MultiBlockAssembler, Parser};
pub use markdown::{CommonMarkRenderer, MarkdownRenderer};
pub use section::{
    ArgumentMap, ArgumentParser, ArgumentValue, BlockParser, ExampleBlock, KeyValueArgumentParser,
    MarkupBlock, MergeEngine, MergeType, Modifier, ParsedReference, ReferenceResolver, Section,
    Snippet,
};
pub use tree::{NodeId, OutlineNode, ReferenceTree, TreeNode};
