// Standardized error codes for SignHex access control

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
}

pub mod authentication {
    pub const NOT_AUTHENTICATED: &str = "AUTH_2001";
}

pub mod authorization {
    pub const ACCESS_DENIED: &str = "AUTHZ_3001";
    pub const ROLE_NOT_FOUND: &str = "AUTHZ_3003";
    pub const ROLE_GRAPH_UNAVAILABLE: &str = "AUTHZ_3004";
}

pub mod configuration {
    pub const INVALID_CONFIG: &str = "CONFIG_5001";
}

pub mod internal {
    pub const NETWORK_FAILURE: &str = "SYS_9001";
    pub const INTERNAL_ERROR: &str = "SYS_9002";
}
