//! JSON acknowledgement bodies returned by API routes.

use serde::Serialize;

/// Fixed-shape JSON body. Keys serialize in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Service banner.
    Info {
        service: &'static str,
        status: &'static str,
    },
    /// Bare status acknowledgement.
    Status { status: &'static str },
    /// Status with a human-readable message.
    Message {
        status: &'static str,
        message: &'static str,
    },
    /// Status with the demand level that was processed.
    Demand {
        status: &'static str,
        demand_level: &'static str,
    },
}

impl Reply {
    /// Serialize the body.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(reply: Reply) -> String {
        String::from_utf8(reply.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_key_order_follows_declaration() {
        let reply = Reply::Message {
            status: "success",
            message: "Market prices updated",
        };
        assert_eq!(
            json(reply),
            r#"{"status":"success","message":"Market prices updated"}"#
        );
    }

    #[test]
    fn test_shapes() {
        assert_eq!(json(Reply::Status { status: "updated" }), r#"{"status":"updated"}"#);
        assert_eq!(
            json(Reply::Info {
                service: "Digital Farming Procurement",
                status: "online",
            }),
            r#"{"service":"Digital Farming Procurement","status":"online"}"#
        );
        assert_eq!(
            json(Reply::Demand {
                status: "processed",
                demand_level: "high",
            }),
            r#"{"status":"processed","demand_level":"high"}"#
        );
    }
}
