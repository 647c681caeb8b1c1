//! CNN architecture for sketch classification.
//!
//! Three double-convolution blocks with increasing filter counts feed a
//! flattened fully connected head. The same architecture serves every
//! endpoint variant; input channels, spatial size, and class count come
//! from the variant configuration.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Dropout, DropoutConfig, LeakyRelu, LeakyReluConfig, Linear,
        LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Configuration for the SketchClassifier CNN model
#[derive(Config, Debug)]
pub struct SketchClassifierConfig {
    /// Number of output classes
    #[config(default = "30")]
    pub num_classes: usize,

    /// Input image size (assumes square images, multiple of 8)
    #[config(default = "64")]
    pub input_size: usize,

    /// Number of input channels (1 for grayscale sketches)
    #[config(default = "1")]
    pub in_channels: usize,

    /// Base number of convolutional filters
    #[config(default = "32")]
    pub base_filters: usize,

    /// Dropout rate inside each convolutional block
    #[config(default = "0.1")]
    pub block_dropout: f64,

    /// Dropout rate in the classifier head
    #[config(default = "0.3")]
    pub head_dropout: f64,

    /// Width of the hidden fully connected layer
    #[config(default = "512")]
    pub hidden_units: usize,
}

/// A double-convolution block: two Conv2d+BatchNorm pairs, leaky ReLU on
/// the first, ReLU on the second, then MaxPool and Dropout.
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B>,
    act1: LeakyRelu,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B>,
    act2: Relu,
    pool: MaxPool2d,
    dropout: Dropout,
}

impl<B: Backend> ConvBlock<B> {
    /// Create a new convolutional block
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        dropout_rate: f64,
        device: &B::Device,
    ) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let bn1 = BatchNormConfig::new(out_channels).init(device);
        let act1 = LeakyReluConfig::new().with_negative_slope(0.1).init();

        let conv2 = Conv2dConfig::new([out_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let bn2 = BatchNormConfig::new(out_channels).init(device);

        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();
        let dropout = DropoutConfig::new(dropout_rate).init();

        Self {
            conv1,
            bn1,
            act1,
            conv2,
            bn2,
            act2: Relu::new(),
            pool,
            dropout,
        }
    }

    /// Forward pass through the block, halving the spatial dimensions
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv1.forward(x);
        let x = self.bn1.forward(x);
        let x = self.act1.forward(x);

        let x = self.conv2.forward(x);
        let x = self.bn2.forward(x);
        let x = self.act2.forward(x);

        let x = self.pool.forward(x);
        self.dropout.forward(x)
    }
}

/// Sketch classifier CNN
///
/// Architecture:
/// - 3 double-conv blocks with 2x pooling (filters: base, base*2, base*4)
/// - Flatten
/// - Hidden linear layer with ReLU and dropout
/// - Linear classification layer producing raw logits
#[derive(Module, Debug)]
pub struct SketchClassifier<B: Backend> {
    block1: ConvBlock<B>,
    block2: ConvBlock<B>,
    block3: ConvBlock<B>,

    fc1: Linear<B>,
    relu: Relu,
    head_dropout: Dropout,
    fc2: Linear<B>,

    num_classes: usize,
}

impl<B: Backend> SketchClassifier<B> {
    /// Create a new SketchClassifier from configuration
    pub fn new(config: &SketchClassifierConfig, device: &B::Device) -> Self {
        let base = config.base_filters;

        let block1 = ConvBlock::new(config.in_channels, base, config.block_dropout, device);
        let block2 = ConvBlock::new(base, base * 2, config.block_dropout, device);
        let block3 = ConvBlock::new(base * 2, base * 4, config.block_dropout, device);

        // Three 2x poolings: input_size -> input_size / 8
        let spatial = config.input_size / 8;
        let flattened = base * 4 * spatial * spatial;

        let fc1 = LinearConfig::new(flattened, config.hidden_units).init(device);
        let head_dropout = DropoutConfig::new(config.head_dropout).init();
        let fc2 = LinearConfig::new(config.hidden_units, config.num_classes).init(device);

        Self {
            block1,
            block2,
            block3,
            fc1,
            relu: Relu::new(),
            head_dropout,
            fc2,
            num_classes: config.num_classes,
        }
    }

    /// Forward pass through the network
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, channels, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.block1.forward(x);
        let x = self.block2.forward(x);
        let x = self.block3.forward(x);

        // Flatten: [B, C, H, W] -> [B, C*H*W]
        let [batch_size, channels, height, width] = x.dims();
        let x = x.reshape([batch_size, channels * height * width]);

        let x = self.fc1.forward(x);
        let x = self.relu.forward(x);
        let x = self.head_dropout.forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let logits = self.forward(x);
        burn::tensor::activation::softmax(logits, 1)
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}
