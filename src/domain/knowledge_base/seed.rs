//! Built-in knowledge corpus used when no persisted collection exists

use super::document::Document;

/// Returns the default corpus, in its canonical order
pub fn seed_documents() -> Vec<Document> {
    vec![
        Document::new(
            "api-workflows",
            "N8N Workflow API Endpoints",
            r#"# N8N Workflow API Endpoints

## Create Workflow
- Method: POST
- Endpoint: /workflows
- Description: Creates a new workflow with JSON configuration
- Required fields: name, nodes, connections

## Update Workflow
- Method: PATCH
- Endpoint: /workflows/{id}
- Description: Updates an existing workflow

## Activate Workflow
- Method: POST
- Endpoint: /workflows/{id}/activate
- Description: Activates a workflow for automatic execution

## Deactivate Workflow
- Method: POST
- Endpoint: /workflows/{id}/deactivate
- Description: Deactivates a workflow

## Execute Workflow
- Method: POST
- Endpoint: /workflows/{id}/run
- Description: Executes a workflow manually"#,
            "api",
        )
        .with_tags(["workflow", "api", "endpoints"]),
        Document::new(
            "api-credentials",
            "N8N Credentials API Endpoints",
            r#"# N8N Credentials API Endpoints

## Create Credential
- Method: POST
- Endpoint: /credentials
- Description: Creates and stores credentials for use in nodes
- Required fields: name, type, data

## Get Credential Schema
- Method: GET
- Endpoint: /credentials/schema/{credentialType}
- Description: Returns the fields needed for a specific credential type"#,
            "api",
        )
        .with_tags(["credentials", "api", "endpoints"]),
        Document::new(
            "triggers-overview",
            "N8N Triggers Overview",
            r#"# N8N Triggers Overview

Triggers are special nodes that start a workflow execution. They are configured in the workflow JSON.

## Common Trigger Types

### Webhook Trigger
- Listens for HTTP requests
- Can be configured for specific methods (GET, POST, etc.)
- Supports authentication

### Cron Trigger
- Executes workflow on a schedule
- Uses cron syntax (e.g., "0 0 * * *" for daily at midnight)

### N8N Trigger
- Responds to internal N8N events
- Events include: "Workflow activated", "Workflow updated", "Instance started"

### Manual Trigger
- Starts workflow manually via UI or API

## Trigger Configuration Example

```json
{
  "id": "123abc",
  "name": "Webhook",
  "type": "n8n-nodes-base.webhook",
  "typeVersion": 1,
  "position": [250, 300],
  "parameters": {
    "path": "my-webhook",
    "responseMode": "onReceived",
    "options": {}
  }
}
```"#,
            "triggers",
        )
        .with_tags(["triggers", "webhook", "cron", "configuration"]),
        Document::new(
            "nodes-overview",
            "N8N Nodes Overview",
            r#"# N8N Nodes Overview

Nodes are the building blocks of N8N workflows. Each node performs a specific action or operation.

## Node Structure in Workflow JSON

```json
{
  "id": "unique-id",
  "name": "Node Name",
  "type": "node-type",
  "typeVersion": 1,
  "position": [x, y],
  "parameters": {}
}
```

## Common Node Types

### HTTP Request
- Makes HTTP requests to external APIs
- Supports all HTTP methods
- Can handle authentication

### Function
- Executes custom JavaScript code
- Processes data with custom logic

### Set
- Sets values in the workflow data
- Can create new fields or modify existing ones

### IF
- Conditional branching
- Routes workflow based on conditions

### Switch
- Multi-way conditional branching
- Routes based on multiple possible values

### Merge
- Combines data from multiple branches
- Different merge modes available"#,
            "nodes",
        )
        .with_tags(["nodes", "configuration", "types"]),
        Document::new(
            "workflow-structure",
            "N8N Workflow Structure",
            r#"# N8N Workflow Structure

A complete N8N workflow is defined by a JSON structure with the following components.

## Basic Structure

```json
{
  "name": "Workflow Name",
  "nodes": [],
  "connections": {},
  "active": true,
  "settings": {
    "executionOrder": "v1"
  },
  "versionId": "1"
}
```

## Connections Format

```json
"connections": {
  "Node A": {
    "main": [[{ "node": "Node B", "type": "main", "index": 0 }]]
  },
  "Node B": {
    "main": [[{ "node": "Node C", "type": "main", "index": 0 }]]
  }
}
```

This structure defines that Node A's output connects to Node B's input, and Node B's output connects to Node C's input."#,
            "workflows",
        )
        .with_tags(["workflow", "structure", "json", "configuration"]),
        Document::new(
            "common-errors",
            "Common N8N Errors and Solutions",
            r#"# Common N8N Errors and Solutions

## Authentication Errors

### Error: "Authentication failed"
- Check if the credential is correctly configured
- Verify API keys or tokens are valid and not expired
- Ensure the credential type matches the service requirements

## Workflow Execution Errors

### Error: "Workflow could not be activated"
- Check if all nodes are properly configured
- Verify that trigger nodes have all required parameters
- Check for circular references in the workflow

### Error: "Execution failed"
- Check the execution logs for specific error messages
- Verify that all services and APIs are accessible
- Check for rate limiting or quota issues with external services

## Node Configuration Errors

### Error: "Required parameter missing"
- Identify the node with the error
- Check the node's documentation for required parameters
- Add the missing parameters to the node configuration

### Error: "Invalid JSON in Function node"
- Check the JavaScript code for syntax errors
- Verify that all brackets and parentheses are balanced
- Test the code in isolation before using in the workflow

## Connection Issues

### Error: "Could not connect to service"
- Check network connectivity
- Verify firewall settings
- Ensure the service endpoint is correct and accessible

## Data Transformation Issues

### Error: "Cannot read property of undefined"
- Use the IF node to check if data exists before processing
- Add error handling for missing data
- Use the Set node to provide default values"#,
            "troubleshooting",
        )
        .with_tags(["errors", "troubleshooting", "solutions"]),
        Document::new(
            "best-practices",
            "N8N Workflow Best Practices",
            r#"# N8N Workflow Best Practices

## Error Handling
- Add Error Trigger nodes to handle workflow failures
- Use Try/Catch nodes for critical operations
- Implement notification mechanisms for failures (email, Slack, etc.)

## Performance Optimization
- Minimize the number of HTTP requests
- Use batch processing when possible
- Implement caching for frequently accessed data
- Use the Function node for complex data transformations instead of multiple Set nodes

## Security
- Store sensitive data in credentials, not in workflow parameters
- Use webhook authentication when exposing endpoints
- Implement rate limiting for public-facing webhooks
- Regularly rotate API keys and tokens

## Maintainability
- Use descriptive names for nodes and workflows
- Add comments to complex Function nodes
- Organize workflows into logical groups
- Version control your workflows using exports

## Testing
- Test workflows with sample data before activating
- Create test workflows for critical components
- Use the Test & Debug feature to validate workflow execution
- Monitor execution times and optimize slow-running nodes"#,
            "best-practices",
        )
        .with_tags(["best-practices", "optimization", "security"]),
        Document::new(
            "mspc-integration",
            "Integrating MSPCs with N8N",
            r#"# Integrating MSPCs with N8N

## MSPC Connection Methods

### HTTP API Integration
- Use the HTTP Request node to connect to MSPC APIs
- Configure authentication using API keys or OAuth
- Map MSPC data structures to N8N workflow data

### Database Integration
- Use database nodes (MySQL, PostgreSQL, etc.) to connect to MSPC databases
- Implement read/write operations for data synchronization
- Use transactions for data integrity

### Webhook Integration
- Configure MSPC to send webhooks to N8N
- Use the Webhook node as a trigger
- Process incoming MSPC event data

## Common MSPC Integration Patterns

### Data Synchronization
- Set up scheduled workflows to sync data between systems
- Implement delta sync to minimize data transfer
- Add error handling and retry logic

### Event-Driven Integration
- Configure MSPC to send events to N8N webhooks
- Process events in real-time
- Implement event filtering and routing

### Service Orchestration
- Use N8N as a central orchestrator for multiple MSPCs
- Implement complex business logic across systems
- Maintain state and handle long-running processes"#,
            "integration",
        )
        .with_tags(["mspc", "integration", "api", "webhook"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let docs = seed_documents();
        let ids: HashSet<_> = docs.iter().map(|d| d.id.as_str()).collect();

        assert_eq!(docs.len(), 8);
        assert_eq!(ids.len(), docs.len());
    }

    #[test]
    fn test_seed_documents_have_content() {
        for doc in seed_documents() {
            assert!(!doc.title.is_empty());
            assert!(!doc.content.trim().is_empty());
            assert!(!doc.category.is_empty());
            assert!(!doc.tags.is_empty());
        }
    }
}
