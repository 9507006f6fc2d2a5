//! Operation names and documents sent to OneGraph.

pub const FETCH_CLI_SESSION_EVENTS: &str = "CLISessionEventsQuery";
pub const FETCH_CLI_SESSION_EVENTS_DOC: &str = r#"query CLISessionEventsQuery($nfToken: String!, $sessionId: String!, $first: Int!) {
  oneGraph {
    netlifyCliEvents(nfToken: $nfToken, sessionId: $sessionId, first: $first) {
      __typename
      id
      createdAt
      sessionId
      ... on OneGraphNetlifyCliSessionGenerateHandlerEvent {
        payload {
          cliSessionId
          operationId
        }
      }
      ... on OneGraphNetlifyCliSessionPersistedLibraryUpdatedEvent {
        payload {
          docId
          schemaId
        }
      }
      ... on OneGraphNetlifyCliSessionOpenFileEvent {
        payload {
          filePath
        }
      }
      ... on OneGraphNetlifyCliSessionTestEvent {
        payload
      }
    }
  }
}"#;

pub const ACK_CLI_SESSION_EVENTS: &str = "AckCLISessionEventMutation";
pub const ACK_CLI_SESSION_EVENTS_DOC: &str = r#"mutation AckCLISessionEventMutation($nfToken: String!, $sessionId: String!, $eventIds: [String!]!) {
  oneGraph {
    ackNetlifyCliEvents(input: {nfToken: $nfToken, sessionId: $sessionId, eventIds: $eventIds}) {
      events {
        id
      }
    }
  }
}"#;

const SESSION_FIELDS: &str = "id name status createdAt updatedAt appId metadata";

/// Where every `updateNetlifyCliSession` mutation returns the session.
pub(crate) const UPDATED_SESSION_PATH: [&str; 3] = ["oneGraph", "updateNetlifyCliSession", "session"];

pub const MARK_CLI_SESSION_ACTIVE_HEARTBEAT: &str = "MarkCLISessionActiveHeartbeat";
pub const MARK_CLI_SESSION_INACTIVE: &str = "MarkCLISessionInactive";
pub const CREATE_CLI_SESSION: &str = "CreateCLISessionMutation";
pub const FETCH_CLI_SESSION: &str = "CLISessionQuery";
pub const UPDATE_CLI_SESSION_METADATA: &str = "UpdateCLISessionMetadataMutation";

pub fn mark_cli_session_active_heartbeat_doc() -> String {
    format!(
        "mutation MarkCLISessionActiveHeartbeat($nfToken: String!, $id: String!) {{
  oneGraph {{
    updateNetlifyCliSession(input: {{nfToken: $nfToken, sessionId: $id, status: ACTIVE}}) {{
      session {{ {SESSION_FIELDS} }}
    }}
  }}
}}"
    )
}

pub fn mark_cli_session_inactive_doc() -> String {
    format!(
        "mutation MarkCLISessionInactive($nfToken: String!, $id: String!) {{
  oneGraph {{
    updateNetlifyCliSession(input: {{nfToken: $nfToken, sessionId: $id, status: INACTIVE}}) {{
      session {{ {SESSION_FIELDS} }}
    }}
  }}
}}"
    )
}

pub fn create_cli_session_doc() -> String {
    format!(
        "mutation CreateCLISessionMutation($nfToken: String!, $appId: String!, $name: String!, $metadata: JSON) {{
  oneGraph {{
    createNetlifyCliSession(input: {{nfToken: $nfToken, appId: $appId, name: $name, metadata: $metadata}}) {{
      session {{ {SESSION_FIELDS} }}
    }}
  }}
}}"
    )
}

pub fn fetch_cli_session_doc() -> String {
    format!(
        "query CLISessionQuery($nfToken: String!, $sessionId: String!) {{
  oneGraph {{
    netlifyCliSession(nfToken: $nfToken, id: $sessionId) {{ {SESSION_FIELDS} }}
  }}
}}"
    )
}

pub fn update_cli_session_metadata_doc() -> String {
    format!(
        "mutation UpdateCLISessionMetadataMutation($nfToken: String!, $sessionId: String!, $metadata: JSON!) {{
  oneGraph {{
    updateNetlifyCliSession(input: {{nfToken: $nfToken, sessionId: $sessionId, metadata: $metadata}}) {{
      session {{ {SESSION_FIELDS} }}
    }}
  }}
}}"
    )
}

pub const CREATE_PERSISTED_QUERY: &str = "CreatePersistedQueryMutation";
pub const CREATE_PERSISTED_QUERY_DOC: &str = r#"mutation CreatePersistedQueryMutation($nfToken: String!, $appId: String!, $query: String!, $tags: [String!]!, $description: String, $allowedOperationNames: [String!]!) {
  oneGraph {
    createPersistedQuery(input: {nfToken: $nfToken, appId: $appId, query: $query, tags: $tags, description: $description, allowedOperationNames: $allowedOperationNames}) {
      persistedQuery {
        id
        query
        description
        allowedOperationNames
        tags
      }
    }
  }
}"#;

pub const FETCH_PERSISTED_QUERY: &str = "PersistedQueryQuery";
pub const FETCH_PERSISTED_QUERY_DOC: &str = r#"query PersistedQueryQuery($nfToken: String!, $appId: String!, $id: String!) {
  oneGraph {
    persistedQuery(nfToken: $nfToken, appId: $appId, id: $id) {
      id
      query
      description
      allowedOperationNames
      tags
    }
  }
}"#;

pub const FETCH_APP_FOR_SITE: &str = "AppForSiteQuery";
pub const FETCH_APP_FOR_SITE_DOC: &str = r#"query AppForSiteQuery($nfToken: String!, $siteId: String!) {
  oneGraph {
    app(nfToken: $nfToken, id: $siteId) {
      id
      name
      netlifySiteId
    }
  }
}"#;

pub const CREATE_APP: &str = "CreateNewAppMutation";
pub const CREATE_APP_DOC: &str = r#"mutation CreateNewAppMutation($nfToken: String!, $name: String!, $netlifySiteId: String!) {
  oneGraph {
    createApp(input: {nfToken: $nfToken, name: $name, netlifySiteId: $netlifySiteId}) {
      app {
        id
        name
        netlifySiteId
      }
    }
  }
}"#;

pub const FETCH_ENABLED_SERVICES: &str = "AppEnabledServicesQuery";
pub const FETCH_ENABLED_SERVICES_DOC: &str = r#"query AppEnabledServicesQuery($nfToken: String!, $appId: String!) {
  oneGraph {
    app(nfToken: $nfToken, id: $appId) {
      graphQLSchema {
        services {
          service
        }
      }
    }
  }
}"#;
