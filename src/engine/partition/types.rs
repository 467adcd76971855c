use crate::engine::inventory::InputFile;

/// Files merged in a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Zero-based index of the owning part
    pub part_index: usize,
    /// Zero-based index within the part
    pub block_index: usize,
    pub files: Vec<InputFile>,
}

impl Block {
    pub fn new(part_index: usize, block_index: usize) -> Self {
        Self {
            part_index,
            block_index,
            files: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Group of blocks that ends up in one final output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub part_index: usize,
    pub blocks: Vec<Block>,
}

impl Part {
    pub fn new(part_index: usize) -> Self {
        Self {
            part_index,
            blocks: Vec::new(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    pub fn size(&self) -> u64 {
        self.blocks.iter().map(Block::size).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = &InputFile> {
        self.blocks.iter().flat_map(|b| b.files.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioning {
    pub parts: Vec<Part>,
}

impl Partitioning {
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn block_count(&self) -> usize {
        self.parts.iter().map(|p| p.blocks.len()).sum()
    }

    pub fn file_count(&self) -> usize {
        self.parts.iter().map(Part::file_count).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.parts.iter().map(Part::size).sum()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.parts.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn files(&self) -> impl Iterator<Item = &InputFile> {
        self.parts.iter().flat_map(Part::files)
    }
}
