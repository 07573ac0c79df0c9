//! Fixed prompt text.

/// Values substituted into the prompt.
pub(super) struct Context<'a> {
    pub project_name: &'a str,
    pub languages: &'a str,
    pub workflows: &'a str,
    pub entry_count: usize,
    pub entry_points: &'a str,
}

pub(super) fn render(ctx: &Context<'_>) -> String {
    let Context { project_name, languages, workflows, entry_count, entry_points } = *ctx;

    format!(
        r#"# Business Logic Workflow Analysis

You are analyzing the codebase of **{project_name}** to document its business logic workflows.

## Project Context

- **Project Name**: {project_name}
- **Languages**: {languages}
- **Entry Points**: {entry_count} detected
- **Documented Workflows**: {workflows}

## Your Task

Analyze this codebase and identify distinct **business logic workflows**. For each workflow:

1. **Identify the workflow** - What business process does it represent?
2. **Find entry points** - API endpoints, event handlers, CLI commands, scheduled jobs
3. **Map components** - Which files, functions, and classes are involved?
4. **Track dependencies**:
   - External APIs called
   - Third-party libraries used
   - Internal services/modules used
5. **Create a flow diagram** - Use Mermaid.js syntax to visualize the flow
6. **Document relationships** - Which workflows trigger or depend on others?

## Output Format

For each workflow, create a markdown file in `.business-logic/workflows/<workflow-name>.md` using this structure:

```markdown
# Workflow: [Workflow Name]

## Description
[What this workflow does from a business perspective]

## Triggers
- **Endpoint**: `[HTTP method] /api/path`
- **Event**: `[event.name]`
- **CLI**: `[command]`

## Components

### Files
- `path/to/file.ext:10-45` - [Role of this file in the workflow]

### External APIs
- **Service Name** (`api.example.com/endpoint`) - [Purpose]

### Internal Services
- `ServiceName` - [Purpose]

### Third-party Libraries
- `package-name` (v1.0.0) - [How it is used]

## Execution Flow

```mermaid
graph TD
    A[Start Point] --> B{{Decision}}
    B -->|Path 1| C[Action]
    B -->|Path 2| D[Action]
    C --> E[End]
    D --> E
```

## Business Dependencies

### Triggers
- `other-workflow` - [When/Why]

### Required by
- `other-workflow` - [When/Why]

## Notes

_Key points, gotchas, or important business rules_
```

## Detected Entry Points

{entry_points}

## Analysis Guidelines

1. **Focus on business value** - Not every function is a workflow
2. **Look for these patterns**:
   - API route handlers (REST, GraphQL endpoints)
   - Event listeners/handlers
   - Scheduled tasks (cron jobs)
   - CLI commands
   - Message queue consumers
   - Background jobs

3. **Identify external interactions**:
   - HTTP API calls to external services
   - Database operations (especially complex transactions)
   - File system operations
   - Email/SMS sending
   - Payment processing
   - Authentication/authorization flows

4. **Map data flows** - How does data move through the system?

5. **Note business rules** - Special conditions, validations, or constraints

## Getting Started

Begin by exploring the entry points listed above. For each one, trace the code execution path and identify the business purpose.

Start with the most critical or frequently-used workflows first (authentication, core data operations, payment flows, etc.).

## Questions to Ask

- What problem does this code solve for the end user?
- What happens if this workflow fails?
- Which external systems does this interact with?
- What are the success/failure conditions?
- Are there any business rules or constraints?

Good luck! Create comprehensive, well-documented workflows that will help developers understand the business logic at a glance.
"#
    )
}
