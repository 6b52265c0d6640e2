//! Protobuf messages of the TensorBoard event format.
//!
//! Only the fields this crate writes are declared; field numbers match
//! `tensorflow/core/util/event.proto` and `summary.proto`.

use prost::Message;

/// `DataType::DT_STRING`
pub const DT_STRING: i32 = 7;

/// File version written as the first event of every file.
pub const FILE_VERSION: &str = "brain.Event:2";

#[derive(Clone, PartialEq, Message)]
pub struct Event {
    #[prost(double, tag = "1")]
    pub wall_time: f64,
    #[prost(int64, tag = "2")]
    pub step: i64,
    #[prost(oneof = "event::What", tags = "3, 5")]
    pub what: Option<event::What>,
}

pub mod event {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum What {
        #[prost(string, tag = "3")]
        FileVersion(String),
        #[prost(message, tag = "5")]
        Summary(super::Summary),
    }
}

impl Event {
    pub fn file_version(wall_time: f64) -> Self {
        Self {
            wall_time,
            step: 0,
            what: Some(event::What::FileVersion(FILE_VERSION.to_string())),
        }
    }

    pub fn summary(wall_time: f64, step: i64, summary: Summary) -> Self {
        Self {
            wall_time,
            step,
            what: Some(event::What::Summary(summary)),
        }
    }

    /// The summary carried by this event, if any.
    pub fn as_summary(&self) -> Option<&Summary> {
        match &self.what {
            Some(event::What::Summary(summary)) => Some(summary),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Summary {
    #[prost(message, repeated, tag = "1")]
    pub value: Vec<SummaryValue>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SummaryValue {
    #[prost(string, tag = "1")]
    pub tag: String,
    #[prost(message, optional, tag = "9")]
    pub metadata: Option<SummaryMetadata>,
    #[prost(oneof = "summary_value::Value", tags = "2, 4, 8")]
    pub value: Option<summary_value::Value>,
}

pub mod summary_value {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        #[prost(float, tag = "2")]
        SimpleValue(f32),
        #[prost(message, tag = "4")]
        Image(super::Image),
        #[prost(message, tag = "8")]
        Tensor(super::TensorProto),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct SummaryMetadata {
    #[prost(message, optional, tag = "1")]
    pub plugin_data: Option<PluginData>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PluginData {
    #[prost(string, tag = "1")]
    pub plugin_name: String,
    #[prost(bytes = "vec", tag = "2")]
    pub content: Vec<u8>,
}

/// Encoded image (PNG or GIF) with its dimensions.
#[derive(Clone, PartialEq, Message)]
pub struct Image {
    #[prost(int32, tag = "1")]
    pub height: i32,
    #[prost(int32, tag = "2")]
    pub width: i32,
    #[prost(int32, tag = "3")]
    pub colorspace: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub encoded_image_string: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorProto {
    #[prost(int32, tag = "1")]
    pub dtype: i32,
    #[prost(message, optional, tag = "2")]
    pub tensor_shape: Option<TensorShape>,
    #[prost(bytes = "vec", repeated, tag = "8")]
    pub string_val: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorShape {
    #[prost(message, repeated, tag = "2")]
    pub dim: Vec<TensorDim>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorDim {
    #[prost(int64, tag = "1")]
    pub size: i64,
}

impl Summary {
    pub fn scalar(tag: &str, value: f32) -> Self {
        Self {
            value: vec![SummaryValue {
                tag: tag.to_string(),
                metadata: None,
                value: Some(summary_value::Value::SimpleValue(value)),
            }],
        }
    }

    /// Text summary readable by TensorBoard's text plugin.
    pub fn text(tag: &str, text: &str) -> Self {
        let tensor = TensorProto {
            dtype: DT_STRING,
            tensor_shape: Some(TensorShape {
                dim: vec![TensorDim { size: 1 }],
            }),
            string_val: vec![text.as_bytes().to_vec()],
        };
        Self {
            value: vec![SummaryValue {
                tag: tag.to_string(),
                metadata: Some(SummaryMetadata {
                    plugin_data: Some(PluginData {
                        plugin_name: "text".to_string(),
                        content: Vec::new(),
                    }),
                }),
                value: Some(summary_value::Value::Tensor(tensor)),
            }],
        }
    }

    pub fn image(tag: &str, image: Image) -> Self {
        Self {
            value: vec![SummaryValue {
                tag: tag.to_string(),
                metadata: None,
                value: Some(summary_value::Value::Image(image)),
            }],
        }
    }
}

/// Serialize an event to its wire bytes.
pub fn encode_event(event: &Event) -> Vec<u8> {
    event.encode_to_vec()
}
