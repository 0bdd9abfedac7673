use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Functional area a PyTorch function belongs to.
///
/// `All` is the browsing sentinel used by the category filter; no card ever
/// carries it, so it cannot be (de)serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(skip)]
    All,
    #[serde(rename = "Tensor Ops", alias = "张量操作")]
    TensorOps,
    #[serde(rename = "Math", alias = "数学运算")]
    Math,
    #[serde(rename = "Neural Networks", alias = "神经网络")]
    NeuralNetworks,
    #[serde(rename = "Optimization", alias = "优化算法")]
    Optimization,
    #[serde(rename = "Data Processing", alias = "数据处理")]
    DataProcessing,
    #[serde(rename = "Utilities", alias = "辅助工具")]
    Utilities,
}

impl Category {
    /// Category pills in display order, starting with the `All` sentinel.
    pub const ALL_CATEGORIES: [Category; 7] = [
        Category::All,
        Category::TensorOps,
        Category::Math,
        Category::NeuralNetworks,
        Category::Optimization,
        Category::DataProcessing,
        Category::Utilities,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::TensorOps => "Tensor Ops",
            Category::Math => "Math",
            Category::NeuralNetworks => "Neural Networks",
            Category::Optimization => "Optimization",
            Category::DataProcessing => "Data Processing",
            Category::Utilities => "Utilities",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }

    /// Whether a card of category `other` passes this filter.
    pub fn admits(&self, other: Category) -> bool {
        self.is_all() || *self == other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Beginner", alias = "入门")]
    Beginner,
    #[serde(rename = "Intermediate", alias = "进阶")]
    Intermediate,
    #[serde(rename = "Advanced", alias = "高级")]
    Advanced,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One flashcard describing a single PyTorch function.
///
/// All seven fields are required on the wire; a payload missing any of them,
/// or carrying an unknown category/difficulty, fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    pub signature: String,
    pub category: Category,
    pub description: String,
    pub code_example: String,
    pub output: String,
    pub difficulty: Difficulty,
}

impl Card {
    /// Last dotted segment of the name, e.g. `Conv2d` for `torch.nn.Conv2d`.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}
